//! JSON endpoints under `/api/v1`.

pub(crate) mod status;
