#[cfg(test)]
pub const DRAFT_DATA: &str = r#"# Learning Rust the hard way

> Notes from a long weekend.

I tried to write a small tool. It went well.

![diagram](img/diagram.png)

1. Read the book
2. Write code

```rust
fn main() {
    println!("hello");
}
```

<!-- more -->

See [the guide](https://doc.rust-lang.org/book/) for <b>more</b> details.
"#;

#[cfg(test)]
pub const CONFIG_DATA: &str = r#"{
  "author": "Thiago",
  "email": "thiago@example.com",
  "projPath": "/home/thiago/blog",
  "postSubDir": "content/posts"
}"#;
