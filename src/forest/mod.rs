pub mod forest;
