//! JSON-RPC 2.0 dispatch pipeline
//!
//! Request normalization, method registration, argument binding, invocation and
//! response assembly. Independent of the HTTP layer; callers hand in raw body
//! bytes or query pairs and get the serialized response back.

pub mod batch;
pub mod binding;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod params;
pub mod registry;
pub mod response;

pub use batch::BatchOutput;
pub use binding::{Arguments, BindError, Signature};
pub use dispatch::{DispatchOptions, Dispatcher, NotificationErrors};
pub use error::{ErrorKind, MessageStyle, MethodError, RpcError};
pub use normalize::RpcInput;
pub use registry::{MethodRegistry, RegistryBuilder, RegistryError, RpcMethod};
pub use response::ResponseEntry;
