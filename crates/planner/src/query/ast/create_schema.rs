#[derive(Debug, Clone)]
pub struct CreateSchema {
    pub name: String,
    pub if_not_exists: bool,
}
