pub mod audit;
pub mod health;
pub mod results;

#[cfg(test)]
mod tests;
