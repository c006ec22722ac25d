// Copyright Amazon.com, Inc. or its affiliates.

//! This module provides the structures and logic that navigate and decode a binary Ion 1.0
//! stream that may arrive in arbitrarily small pieces.

pub mod constants;

pub(crate) mod binary_buffer;
pub mod cursor;
pub mod int;
pub mod scalar_reader;
pub(crate) mod type_code;
pub mod type_descriptor;
pub mod uint;
pub mod var_int;
pub mod var_uint;

pub use type_code::IonTypeCode;
