/// let m: HashMap<&str, &str> = hashmap_literal! {
///  "shorten" => "v3/shorten",
///  "expand" => "v3/expand",
/// };
#[macro_export]
macro_rules! hashmap_literal {
  ($($key:expr => $value:expr),* $(,)?) => {{
    use std::collections::HashMap;

    HashMap::from([
      $(($key, $value),)*
    ])
  }}
}
