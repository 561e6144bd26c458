/// Name of the module all core IBC messages are routed to.
pub const ROUTER_KEY: &str = "ibc";
