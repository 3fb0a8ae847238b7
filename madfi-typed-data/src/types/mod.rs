pub mod abi;
pub mod bounty;
pub mod typed_data;
pub mod utils;
