use bookstore_repository::api::{Book, Category, Customer};

/// Record that can be narrowed down by a free text filter
pub trait Searchable {
    /// Text fields the filter looks into, absent optional fields are `None`
    fn search_fields(&self) -> Vec<Option<&str>>;
}

impl Searchable for Book {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.title), Some(&self.author)]
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.category_name)]
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.name), self.email.as_deref()]
    }
}

/// Case insensitive substring match over the searchable fields of a record
pub fn matches_filter<R: Searchable>(record: &R, filter: &str) -> bool {
    let needle = filter.to_lowercase();
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching `filter`, in their original order. An empty filter keeps everything
pub fn filter_records<'a, R: Searchable>(records: &'a [R], filter: &str) -> Vec<&'a R> {
    if filter.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches_filter(*record, filter))
        .collect()
}

#[cfg(test)]
mod filter_tests {
    use super::*;

    fn book(book_id: i32, title: &str, author: &str) -> Book {
        Book {
            book_id,
            title: title.to_string(),
            sub_title: None,
            author: author.to_string(),
            category_id: 1,
            category_name: "Novels".to_string(),
            price: 10.0,
            rental_price_per_day: 1.0,
            quantity_in_stock: 3,
        }
    }

    fn customer(customer_id: i32, name: &str, email: Option<&str>) -> Customer {
        Customer {
            customer_id,
            name: name.to_string(),
            phone: None,
            email: email.map(str::to_string),
            address: None,
        }
    }

    #[test]
    fn test_filter_matches_title_only_when_author_differs() {
        let books = vec![book(1, "Alef", "X"), book(2, "Beta", "Y")];
        let visible: Vec<&Book> = filter_records(&books, "al");
        assert_eq!(visible, vec![&books[0]]);
    }

    #[test]
    fn test_books_filtered_by_title_or_author() {
        let books = vec![book(1, "Alef", "X"), book(2, "Beta", "Al")];

        let visible: Vec<i32> = filter_records(&books, "al")
            .into_iter()
            .map(|book| book.book_id)
            .collect();
        assert_eq!(visible, vec![1, 2]);

        let visible: Vec<i32> = filter_records(&books, "BET")
            .into_iter()
            .map(|book| book.book_id)
            .collect();
        assert_eq!(visible, vec![2]);
    }

    #[test]
    fn test_empty_filter_keeps_list_unchanged() {
        let books = vec![book(3, "Gamma", "Z"), book(1, "Alef", "X")];
        let visible: Vec<&Book> = filter_records(&books, "");
        assert_eq!(visible, books.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_customer_without_email_matches_by_name_only() {
        let customers = vec![
            customer(1, "Sara", None),
            customer(2, "Hany", Some("sara@mail.com")),
            customer(3, "Mostafa", Some("m@mail.com")),
        ];

        let visible: Vec<i32> = filter_records(&customers, "sara")
            .into_iter()
            .map(|customer| customer.customer_id)
            .collect();
        assert_eq!(visible, vec![1, 2]);
        assert!(filter_records(&customers, "nobody").is_empty());
    }

    #[test]
    fn test_category_filter() {
        let categories = vec![
            Category {
                category_id: 1,
                category_name: "History".to_string(),
            },
            Category {
                category_id: 2,
                category_name: "Science".to_string(),
            },
        ];
        assert_eq!(filter_records(&categories, "SCI").len(), 1);
        assert!(matches_filter(&categories[0], "stor"));
    }
}
