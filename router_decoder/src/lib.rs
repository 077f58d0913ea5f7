pub mod error;
pub mod logging;
pub mod permit2_sdk;
pub mod prelude;
pub mod universal_router_sdk;
