pub mod displace;
pub mod pipeline;
