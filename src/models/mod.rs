//! Request and Response models for the KV server API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CounterRequest, ExpireRequest, HashCounterRequest, HashDeleteRequest, HashSetRequest,
    KeysParams, LockRequest, MGetRequest, MSetRequest, SetRequest,
};
pub use responses::{
    AckResponse, CounterResponse, ErrorResponse, ExistsResponse, ExpireResponse, HashAllResponse,
    HealthResponse, KeysResponse, LockResponse, MGetResponse, MSetResponse, StatsResponse,
    TtlResponse, ValueResponse,
};
