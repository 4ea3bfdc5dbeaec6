pub mod client_ip;
pub mod cookie;
pub mod middleware;
pub mod password;
pub mod token;
