//! Definitions of custom keywords.
//!
//! Keywords that are also Rust keywords (`if`, `else`, `while`, `do`,
//! `return`) use the corresponding `syn::Token![...]` types instead.

syn::custom_keyword!(func);
syn::custom_keyword!(endfunc);
syn::custom_keyword!(var);
syn::custom_keyword!(then);
syn::custom_keyword!(endif);
syn::custom_keyword!(endwhile);
syn::custom_keyword!(read);
syn::custom_keyword!(write);
syn::custom_keyword!(not);
syn::custom_keyword!(and);
syn::custom_keyword!(or);
syn::custom_keyword!(array);
syn::custom_keyword!(of);
