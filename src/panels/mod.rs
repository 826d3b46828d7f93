mod page_navigator;
mod toolbar;

pub use page_navigator::page_navigator;
pub use toolbar::toolbar;
