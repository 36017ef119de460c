pub mod knitting;
