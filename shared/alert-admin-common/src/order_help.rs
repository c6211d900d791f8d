//! Selection of the order value-help block for a category and page

use serde::{Deserialize, Serialize};

use crate::formatter::delete_leading_zero;
use crate::types::Category;

/// Layout shown in the order value help
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderHelpBlock {
    Inventory,
    Logistics,
    ProcessFirstPage,
    ProcessFollowingPages,
}

/// Block to show for the chosen category and page, `None` until a category is chosen
pub fn help_block(category: Option<Category>, page_no: &str) -> Option<OrderHelpBlock> {
    match category? {
        Category::Inventory => Some(OrderHelpBlock::Inventory),
        Category::Logistics => Some(OrderHelpBlock::Logistics),
        Category::Process if delete_leading_zero(page_no.trim()) == "1" => {
            Some(OrderHelpBlock::ProcessFirstPage)
        }
        Category::Process => Some(OrderHelpBlock::ProcessFollowingPages),
    }
}
