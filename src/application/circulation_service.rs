use crate::domain::{
    self, BookId, BorrowError, BorrowRecord, DeleteError, ReturnError, UserName, commands::*,
};

use super::errors::{LibraryApplicationError, Result};
use super::service_dependencies::ServiceDependencies;

/// 書籍と未返却記録を読み込み、整合性を確認するヘルパー関数
///
/// borrow_book, return_book, delete_bookで共通利用される。
/// 呼び出し側は書き込みロックを保持していること。
///
/// # エラー
/// - BookNotFound: 書籍が存在しない
/// - InvariantViolation: 貸出フラグと台帳が食い違っている
async fn load_book_state(
    deps: &ServiceDependencies,
    book_id: BookId,
) -> Result<(domain::Book, Option<BorrowRecord>)> {
    let book = deps
        .catalog
        .get(book_id)
        .await
        .map_err(LibraryApplicationError::CatalogError)?
        .ok_or(LibraryApplicationError::BookNotFound(book_id))?;

    let open = deps
        .ledger
        .open_record_for(book_id)
        .await
        .map_err(LibraryApplicationError::from_ledger)?;

    if let Err(violation) = domain::circulation::check_consistency(&book, open.as_ref()) {
        tracing::error!(book_id = %book_id, "{}", violation);
        return Err(violation.into());
    }

    Ok((book, open))
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 利用者が登録済みであること
/// - 書籍が存在すること
/// - 書籍が貸出中でないこと（誰が借りていても不可）
///
/// # 一貫性保証
///
/// 書き込みロックを確認から更新まで保持するため、同じ書籍への同時貸出は
/// 1件だけが成功する。貸出フラグ（キャッシュ）を先に立て、台帳への追記に
/// 失敗した場合はフラグを戻す。
///
/// # 戻り値
/// 作成された貸出記録
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<BorrowRecord> {
    let user_name = UserName::new(&cmd.user_name)?;

    let _guard = deps.gate.write().await;

    // 1. 利用者の存在確認
    let user_exists = deps
        .user_directory
        .exists(&user_name)
        .await
        .map_err(LibraryApplicationError::UserDirectoryError)?;

    if !user_exists {
        return Err(LibraryApplicationError::UserNotFound(user_name));
    }

    // 2. 書籍と台帳の状態を確認
    let (book, open) = load_book_state(deps, cmd.book_id).await?;

    // 3. ドメイン層の純粋関数を呼び出し
    let (borrowed, record) =
        domain::circulation::borrow_book(&book, open.as_ref(), user_name, cmd.borrowed_on)
            .map_err(|e| match e {
                BorrowError::AlreadyBorrowed => {
                    tracing::warn!(book_id = %book.id, "book is already borrowed");
                    LibraryApplicationError::AlreadyBorrowed(book.id)
                }
            })?;

    // 4. 貸出フラグを立てる
    deps.catalog
        .set_borrowed(borrowed.id, borrowed.is_borrowed)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    // 5. 台帳に追記（失敗したらフラグを戻す）
    let record = match deps.ledger.create(record).await {
        Ok(record) => record,
        Err(e) => {
            if let Err(revert) = deps.catalog.set_borrowed(book.id, book.is_borrowed).await {
                tracing::error!(book_id = %book.id, "failed to revert borrow flag: {}", revert);
            }
            return Err(LibraryApplicationError::from_ledger(e));
        }
    };

    tracing::info!(
        book_id = %record.book_id,
        user = %record.user_name,
        record_id = %record.id,
        "book borrowed"
    );
    Ok(record)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 未返却の貸出記録があること
/// - 借りた本人による返却であること
///
/// # 一貫性保証
///
/// 書き込みロックを保持して処理する。貸出フラグを先に下ろし、
/// 台帳の更新に失敗した場合はフラグを戻す。
///
/// # 戻り値
/// 返却日が設定された貸出記録
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<BorrowRecord> {
    let user_name = UserName::new(&cmd.user_name)?;

    let _guard = deps.gate.write().await;

    // 1. 書籍と台帳の状態を確認
    let (book, open) = load_book_state(deps, cmd.book_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let (available, closed) =
        domain::circulation::return_book(&book, open.as_ref(), &user_name, cmd.returned_on)
            .map_err(|e| {
                tracing::warn!(book_id = %book.id, user = %user_name, "return rejected: {:?}", e);
                match e {
                    ReturnError::NoActiveBorrow => LibraryApplicationError::NoActiveBorrow {
                        book_id: book.id,
                        user_name: user_name.clone(),
                    },
                    ReturnError::ReturnMismatch => LibraryApplicationError::ReturnMismatch {
                        book_id: book.id,
                        user_name: user_name.clone(),
                    },
                }
            })?;

    // 3. 貸出フラグを下ろす
    deps.catalog
        .set_borrowed(available.id, available.is_borrowed)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    // 4. 台帳の記録を閉じる（失敗したらフラグを戻す）
    let return_date = closed.return_date.unwrap_or(cmd.returned_on);
    let outcome = deps
        .ledger
        .close(closed.id, return_date)
        .await
        .map_err(LibraryApplicationError::from_ledger)
        .and_then(|updated| {
            if updated {
                Ok(())
            } else {
                Err(LibraryApplicationError::RecordNotFound(closed.id))
            }
        });

    if let Err(e) = outcome {
        if let Err(revert) = deps.catalog.set_borrowed(book.id, book.is_borrowed).await {
            tracing::error!(book_id = %book.id, "failed to revert borrow flag: {}", revert);
        }
        return Err(e);
    }

    tracing::info!(
        book_id = %closed.book_id,
        user = %closed.user_name,
        record_id = %closed.id,
        "book returned"
    );
    Ok(closed)
}

/// 書籍を削除する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 貸出中でないこと（台帳に未返却の記録がないこと）
///
/// 台帳の記録は履歴として残す。
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let _guard = deps.gate.write().await;

    let (book, open) = load_book_state(deps, book_id).await?;

    domain::circulation::ensure_deletable(&book, open.as_ref()).map_err(|e| match e {
        DeleteError::BookCurrentlyBorrowed => {
            tracing::warn!(book_id = %book_id, "rejected delete of borrowed book");
            LibraryApplicationError::BookCurrentlyBorrowed(book_id)
        }
    })?;

    let deleted = deps
        .catalog
        .delete(book_id)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    if !deleted {
        return Err(LibraryApplicationError::BookNotFound(book_id));
    }

    tracing::info!(book_id = %book_id, "book deleted");
    Ok(())
}

/// 台帳の全記録（返却済みを含む）を貸出日の昇順で返す
pub async fn list_borrow_records(deps: &ServiceDependencies) -> Result<Vec<BorrowRecord>> {
    let _guard = deps.gate.read().await;

    deps.ledger
        .list_all()
        .await
        .map_err(LibraryApplicationError::from_ledger)
}
