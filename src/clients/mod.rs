pub mod live_client;
