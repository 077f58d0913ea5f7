pub mod command_params;
pub mod command_stream;
pub mod contract_call;
pub mod options;
pub mod structs;
pub mod universal_router_commands;
pub mod universal_router_decoder;
pub mod v3_path;
