pub mod serve;

#[cfg(test)]
#[path = "serve_test.rs"]
mod serve_test;
