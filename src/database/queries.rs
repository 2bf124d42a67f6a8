// region:    --- Users
/// 이메일 중복 확인
pub const EXISTS_USER_EMAIL: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)";

/// 사용자명 중복 확인
pub const EXISTS_USER_USERNAME: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)";

/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, admin)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, password_hash, admin
"#;

/// 이메일로 사용자 조회
pub const GET_USER_BY_EMAIL: &str =
    "SELECT id, username, email, password_hash, admin FROM users WHERE email = $1";

/// 판매자 정보 조회
pub const GET_USER_SUMMARIES: &str =
    "SELECT id, username, email, admin FROM users WHERE id = ANY($1)";

// endregion: --- Users

// region:    --- Products
/// 모든 상품 조회
pub const GET_ALL_PRODUCTS: &str = r#"
    SELECT id, name, description, category, original_price, picture_url, end_date, seller_id
    FROM products
    ORDER BY id
"#;

/// 상품 조회
pub const GET_PRODUCT: &str = r#"
    SELECT id, name, description, category, original_price, picture_url, end_date, seller_id
    FROM products
    WHERE id = $1
"#;

/// 상품 생성
pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, description, category, original_price, picture_url, end_date, seller_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, name, description, category, original_price, picture_url, end_date, seller_id
"#;

/// 상품 판매자 조회 (수정/삭제용 행 잠금)
pub const LOCK_PRODUCT_SELLER: &str = "SELECT seller_id FROM products WHERE id = $1 FOR UPDATE";

/// 상품 존재 확인 (입찰 생성 동안 삭제 방지)
pub const SHARE_LOCK_PRODUCT: &str = "SELECT id FROM products WHERE id = $1 FOR SHARE";

/// 상품 수정 (NULL 인 파라미터는 기존 값 유지)
pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products SET
        name = COALESCE($2, name),
        description = COALESCE($3, description),
        category = COALESCE($4, category),
        original_price = COALESCE($5, original_price),
        picture_url = COALESCE($6, picture_url),
        end_date = COALESCE($7, end_date)
    WHERE id = $1
    RETURNING id, name, description, category, original_price, picture_url, end_date, seller_id
"#;

/// 상품 삭제 (입찰은 ON DELETE CASCADE)
pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

// endregion: --- Products

// region:    --- Bids
/// 상품들의 입찰 조회
pub const GET_BIDS_FOR_PRODUCTS: &str = r#"
    SELECT id, product_id, bidder_id, price, date
    FROM bids
    WHERE product_id = ANY($1)
    ORDER BY date, id
"#;

/// 입찰 생성
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (product_id, bidder_id, price, date)
    VALUES ($1, $2, $3, $4)
    RETURNING id, product_id, bidder_id, price, date
"#;

/// 입찰자 조회 (삭제용 행 잠금)
pub const LOCK_BID_BIDDER: &str = "SELECT bidder_id FROM bids WHERE id = $1 FOR UPDATE";

/// 입찰 삭제
pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";

// endregion: --- Bids
