#[cfg(test)]
mod console_server_tests;
