mod common;
mod progress;
mod service;
