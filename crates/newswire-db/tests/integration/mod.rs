pub mod common;

mod article_store_tests;
mod pipeline_tests;
mod queue_tests;
