pub mod compile;
pub mod edit;
pub mod init;

pub use compile::{compile, CompileArgs};
pub use edit::{add, move_block, remove, tree, AddArgs, MoveArgs, RemoveArgs, TreeArgs};
pub use init::{init, InitArgs};
