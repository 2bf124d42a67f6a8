use crate::auth::Claims;

/// 리소스 소유자 또는 관리자만 수정/삭제 가능
pub fn can_modify(owner_id: i64, caller: &Claims) -> bool {
    owner_id == caller.id || caller.admin
}
