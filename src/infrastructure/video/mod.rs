pub mod stream_client;
