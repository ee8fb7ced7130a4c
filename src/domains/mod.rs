// 领域模块 - 用于组织应用的业务逻辑
//
// 按业务领域分组,实现单一职责原则
// 包含2个领域:应用目录、自动化

pub mod automation;
pub mod catalog;

pub use automation::AutomationDomain;
pub use catalog::CatalogDomain;
