mod pack;

pub use pack::cmd_pack;
