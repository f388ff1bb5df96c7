#[cfg(test)]
mod utils;
#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod concurrency_tests;
