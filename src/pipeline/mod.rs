pub mod contradiction;
