pub mod checkout_api;
pub mod in_memory;
