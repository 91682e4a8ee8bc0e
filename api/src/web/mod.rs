pub mod handler;
pub mod middleware;
pub mod params;
pub mod response;
pub mod routes;
pub mod server;
