// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Wire messages and generated stubs for the `process.ProcessService` RPC.
//!
//! ```text
//! message ProcessRequest  { repeated int64 numbers = 1; }
//! message ProcessResponse { int64 result = 1; }
//! service ProcessService  { rpc Process(ProcessRequest) returns (ProcessResponse); }
//! ```

/// Request carrying the numbers to sum.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessRequest {
    #[prost(int64, repeated, tag = "1")]
    pub numbers: Vec<i64>,
}

/// Response carrying the sum.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessResponse {
    #[prost(int64, tag = "1")]
    pub result: i64,
}

include!(concat!(env!("OUT_DIR"), "/process.ProcessService.rs"));

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_empty_request_encodes_to_nothing() {
        let request = ProcessRequest { numbers: vec![] };
        assert_eq!(request.encoded_len(), 0);
    }

    #[test]
    fn test_repeated_numbers_are_packed() {
        // tag 1, wire type 2, length 3, then one varint byte per small number
        let request = ProcessRequest {
            numbers: vec![1, 2, 3],
        };
        assert_eq!(request.encode_to_vec(), vec![0x0a, 0x03, 0x01, 0x02, 0x03]);
    }
}
