pub mod contrast;
pub mod curves;
pub mod run;
