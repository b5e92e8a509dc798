pub mod mackie;
