pub mod profiles;
pub mod release;
pub mod template;

pub trait SubCommand {
    fn execute(&self) -> Result<(), anyhow::Error>;
}
