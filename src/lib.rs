pub mod console;
pub mod crawler;
pub mod pool;
