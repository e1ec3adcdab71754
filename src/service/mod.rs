pub mod authorization;
pub mod date_extractor;
pub mod dispatcher;
pub mod event_store;
pub mod message_service;
pub mod openai_service;
pub mod routing;
