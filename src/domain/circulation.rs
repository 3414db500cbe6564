use chrono::NaiveDate;

use super::{
    Book, BorrowError, BorrowRecord, BorrowRecordId, DeleteError, InvariantError, ReturnError,
    UserName,
};

/// 純粋関数：書籍の貸出フラグと未返却記録の整合性を確認する
///
/// 不変条件：`is_borrowed`は未返却の貸出記録が存在するときに限りtrue。
/// 貸出・返却・削除の判定の前に必ず呼ぶ。
pub fn check_consistency(book: &Book, open: Option<&BorrowRecord>) -> Result<(), InvariantError> {
    match (book.is_borrowed, open) {
        (true, None) => Err(InvariantError::FlaggedWithoutRecord { book_id: book.id }),
        (false, Some(record)) => Err(InvariantError::RecordWithoutFlag {
            book_id: book.id,
            user_name: record.user_name.clone(),
        }),
        (_, Some(record)) if record.book_id != book.id || !record.is_open() => {
            Err(InvariantError::RecordForOtherBook {
                book_id: book.id,
                record_book_id: record.book_id,
            })
        }
        _ => Ok(()),
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出中の書籍は誰であっても借りられない
/// - 貸出記録のタイトルは貸出時点のものを記録する
///
/// 副作用なし。貸出中になった書籍と新しい貸出記録を返す。
pub fn borrow_book(
    book: &Book,
    open: Option<&BorrowRecord>,
    user_name: UserName,
    borrowed_on: NaiveDate,
) -> Result<(Book, BorrowRecord), BorrowError> {
    if book.is_borrowed || open.is_some() {
        return Err(BorrowError::AlreadyBorrowed);
    }

    let record = BorrowRecord {
        id: BorrowRecordId::new(),
        user_name,
        book_id: book.id,
        book_title: book.title.clone(),
        borrow_date: borrowed_on,
        return_date: None,
    };

    let borrowed = Book {
        is_borrowed: true,
        ..book.clone()
    };

    Ok((borrowed, record))
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 未返却の貸出記録が必要
/// - 借りた本人のみ返却できる
/// - 返却日が貸出日より前になる場合は貸出日に揃える
///
/// 副作用なし。貸出可能になった書籍と返却済みの貸出記録を返す。
pub fn return_book(
    book: &Book,
    open: Option<&BorrowRecord>,
    user_name: &UserName,
    returned_on: NaiveDate,
) -> Result<(Book, BorrowRecord), ReturnError> {
    let record = open.ok_or(ReturnError::NoActiveBorrow)?;

    if !record.is_held_by(user_name) {
        return Err(ReturnError::ReturnMismatch);
    }

    let closed = BorrowRecord {
        return_date: Some(returned_on.max(record.borrow_date)),
        ..record.clone()
    };

    let available = Book {
        is_borrowed: false,
        ..book.clone()
    };

    Ok((available, closed))
}

/// 純粋関数：書籍を削除できるか判定する
pub fn ensure_deletable(book: &Book, open: Option<&BorrowRecord>) -> Result<(), DeleteError> {
    if book.is_borrowed || open.is_some() {
        return Err(DeleteError::BookCurrentlyBorrowed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookDetails, BookId};

    fn book() -> Book {
        Book::new(BookId::new(1), BookDetails::new("A", "X", "111").unwrap())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn alice() -> UserName {
        UserName::new("alice").unwrap()
    }

    // TDD: borrow_book() のテスト
    #[test]
    fn test_borrow_book_opens_record_and_flags_book() {
        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();

        assert!(borrowed.is_borrowed);
        assert_eq!(borrowed.id, BookId::new(1));
        assert!(record.is_open());
        assert_eq!(record.book_id, BookId::new(1));
        assert_eq!(record.book_title, "A");
        assert_eq!(record.user_name, alice());
        assert_eq!(record.borrow_date, day(1));
    }

    #[test]
    fn test_borrow_book_fails_when_already_borrowed() {
        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();

        let bob = UserName::new("bob").unwrap();
        let result = borrow_book(&borrowed, Some(&record), bob, day(2));
        assert_eq!(result.unwrap_err(), BorrowError::AlreadyBorrowed);

        // 同じ利用者でも借りられない
        let result = borrow_book(&borrowed, Some(&record), alice(), day(2));
        assert_eq!(result.unwrap_err(), BorrowError::AlreadyBorrowed);
    }

    // TDD: return_book() のテスト
    #[test]
    fn test_return_book_closes_record() {
        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();

        let (available, closed) = return_book(&borrowed, Some(&record), &alice(), day(5)).unwrap();

        assert!(!available.is_borrowed);
        assert_eq!(closed.id, record.id);
        assert_eq!(closed.return_date, Some(day(5)));
        assert!(!closed.is_open());
    }

    #[test]
    fn test_return_book_without_open_record() {
        let result = return_book(&book(), None, &alice(), day(5));
        assert_eq!(result.unwrap_err(), ReturnError::NoActiveBorrow);
    }

    #[test]
    fn test_return_book_by_other_user() {
        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();

        let bob = UserName::new("bob").unwrap();
        let result = return_book(&borrowed, Some(&record), &bob, day(5));
        assert_eq!(result.unwrap_err(), ReturnError::ReturnMismatch);
    }

    #[test]
    fn test_return_date_never_precedes_borrow_date() {
        let (borrowed, record) = borrow_book(&book(), None, alice(), day(10)).unwrap();

        let (_, closed) = return_book(&borrowed, Some(&record), &alice(), day(9)).unwrap();
        assert_eq!(closed.return_date, Some(day(10)));
    }

    // TDD: ensure_deletable() のテスト
    #[test]
    fn test_ensure_deletable() {
        assert!(ensure_deletable(&book(), None).is_ok());

        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();
        assert_eq!(
            ensure_deletable(&borrowed, Some(&record)).unwrap_err(),
            DeleteError::BookCurrentlyBorrowed
        );
    }

    // TDD: check_consistency() のテスト
    #[test]
    fn test_check_consistency_accepts_matching_state() {
        assert!(check_consistency(&book(), None).is_ok());

        let (borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();
        assert!(check_consistency(&borrowed, Some(&record)).is_ok());
    }

    #[test]
    fn test_check_consistency_detects_flag_without_record() {
        let mut flagged = book();
        flagged.is_borrowed = true;

        assert_eq!(
            check_consistency(&flagged, None).unwrap_err(),
            InvariantError::FlaggedWithoutRecord {
                book_id: BookId::new(1)
            }
        );
    }

    #[test]
    fn test_check_consistency_detects_record_without_flag() {
        let (_, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();

        assert!(matches!(
            check_consistency(&book(), Some(&record)),
            Err(InvariantError::RecordWithoutFlag { .. })
        ));
    }

    #[test]
    fn test_check_consistency_detects_record_for_other_book() {
        let (mut borrowed, record) = borrow_book(&book(), None, alice(), day(1)).unwrap();
        borrowed.id = BookId::new(2);

        assert!(matches!(
            check_consistency(&borrowed, Some(&record)),
            Err(InvariantError::RecordForOtherBook { .. })
        ));
    }
}
