use std::sync::LazyLock;

use redis::Script;

pub const GUIDE_CREATE_BODY: &str = include_str!("../../lua/guide_create.lua");
pub const GUIDE_UPDATE_BODY: &str = include_str!("../../lua/guide_update.lua");
pub const GUIDE_DELETE_BODY: &str = include_str!("../../lua/guide_delete.lua");
pub const GUIDE_TOGGLE_LIKE_BODY: &str = include_str!("../../lua/guide_toggle_like.lua");
pub const COMMENT_CREATE_BODY: &str = include_str!("../../lua/comment_create.lua");
pub const COMMENT_DELETE_BODY: &str = include_str!("../../lua/comment_delete.lua");

pub static GUIDE_CREATE: LazyLock<Script> = LazyLock::new(|| Script::new(GUIDE_CREATE_BODY));
pub static GUIDE_UPDATE: LazyLock<Script> = LazyLock::new(|| Script::new(GUIDE_UPDATE_BODY));
pub static GUIDE_DELETE: LazyLock<Script> = LazyLock::new(|| Script::new(GUIDE_DELETE_BODY));
pub static GUIDE_TOGGLE_LIKE: LazyLock<Script> = LazyLock::new(|| Script::new(GUIDE_TOGGLE_LIKE_BODY));
pub static COMMENT_CREATE: LazyLock<Script> = LazyLock::new(|| Script::new(COMMENT_CREATE_BODY));
pub static COMMENT_DELETE: LazyLock<Script> = LazyLock::new(|| Script::new(COMMENT_DELETE_BODY));
