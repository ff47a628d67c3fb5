mod client;

pub use client::WebhookClient;
