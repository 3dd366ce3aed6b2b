pub mod chatbot;
pub mod file_analysis;
pub mod image_generator;
pub mod metrics_manager;
pub mod openai;
pub mod page;
pub mod provider;
pub mod session_manager;
