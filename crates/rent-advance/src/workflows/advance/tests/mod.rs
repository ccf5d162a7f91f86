mod common;
mod optimizer;
