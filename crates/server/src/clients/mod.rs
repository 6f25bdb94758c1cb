pub mod tablebase;
