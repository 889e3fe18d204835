// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Table row shorthand: `cells!["Zoë Crush", null, "7"]`.
/// `null` becomes `None`, any literal becomes `Some(String)`.
#[macro_export]
macro_rules! cells {
    (@one null) => { ::std::option::Option::None };
    (@one $lit:literal) => {
        ::std::option::Option::Some(::std::string::String::from($lit))
    };
    ($($cell:tt),* $(,)?) => {
        ::std::vec![$($crate::cells!(@one $cell)),*]
    };
}
