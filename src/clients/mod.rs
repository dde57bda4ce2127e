pub mod itunes;
