/// Extends string types with useful functions
pub trait StringExt {
    /// Capilalises the first letter in a string
    ///
    /// ```rust
    /// # use mcdeck_utils::StringExt;
    /// assert_eq!("fe".capitalise(), "Fe".to_string());
    /// ```
    fn capitalise(&self) -> String;

    /// Collapse every run of whitespace to a single space and trim the ends
    ///
    /// ```rust
    /// # use mcdeck_utils::StringExt;
    /// assert_eq!("  10  0\t -1   imp:n=1 ".squash(), "10 0 -1 imp:n=1");
    /// ```
    fn squash(&self) -> String;

    /// Number of leading space characters
    ///
    /// ```rust
    /// # use mcdeck_utils::StringExt;
    /// assert_eq!("     1 2".indent(), 5);
    /// assert_eq!("m1 1001 1".indent(), 0);
    /// ```
    fn indent(&self) -> usize;
}

impl<T: AsRef<str> + ?Sized> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
            None => String::new(),
        }
    }

    fn squash(&self) -> String {
        self.as_ref().split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn indent(&self) -> usize {
        self.as_ref().chars().take_while(|c| *c == ' ').count()
    }
}
