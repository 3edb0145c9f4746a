extern crate proc_macro;
extern crate quote;
extern crate syn;

use proc_macro::{TokenStream};
use proc_macro2::{Span, Literal, Ident};
use quote::quote;
use std::iter::FromIterator;
use syn::{Token, Lit};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use std::collections::HashSet;

const FIXTURE_DIR: &str = "testdata";
const FIXTURE_SUFFIX: &str = ".ops";
const GOLDEN_SUFFIX: &str = ".golden";

struct GoldenInput {
    known_failures: HashSet<String>
}

impl Parse for GoldenInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let content;
        syn::bracketed!(content in input);
        let inner_tokens : Punctuated<Lit, Token![,]> = content.parse_terminated(Lit::parse)?;
        Ok(GoldenInput {
            known_failures: inner_tokens.iter().filter_map(
            |s| {
                match s {
                    Lit::Str(a) => Some(a.value()),
                    _ => {
                        println!("Warning: ignoring non-string literal in known failure list.");
                        None
                    }
                }
            }).collect()
        })
    }
}

/// Expands to one `#[test]` per `testdata/*.ops` fixture. Each generated test
/// calls `common::golden(<file name>)`, which the including test file provides.
#[proc_macro]
pub fn generate_golden_tests(input: TokenStream) -> TokenStream {

    let mut golden_input = syn::parse_macro_input!(input as GoldenInput);

    let mut entries: Vec<String> = std::fs::read_dir(FIXTURE_DIR).expect("fixture dir")
        .map(|res| res.map(|e| e.path()))
        .filter_map(|p| {
            let pathbuf = p.expect("fixture path");
            let filename = pathbuf.file_name().expect("filename").to_str().expect("str").to_string();
            if filename.ends_with(GOLDEN_SUFFIX) {
                return None
            }
            if !filename.ends_with(FIXTURE_SUFFIX) {
                panic!("Fixture {} ends in neither {} nor {}.", filename, FIXTURE_SUFFIX, GOLDEN_SUFFIX)
            }
            if golden_input.known_failures.contains(&filename) {
                println!("Ignoring known failure: {}", filename);
                golden_input.known_failures.remove(&filename);
                return None
            }
            Some(filename)
        })
        .collect();
    entries.sort();

    if !golden_input.known_failures.is_empty() {
        panic!("One or more known failures didn't match an actual fixture: {:?}", golden_input.known_failures)
    }

    let mut streams : Vec<TokenStream> = vec![];
    entries.iter().for_each(|fixture| {
        let test_name = format!("golden_{}", &fixture[..fixture.len() - FIXTURE_SUFFIX.len()]);

        let filename = Literal::string(fixture);
        let methodname = Ident::new(&test_name, Span::call_site());
        streams.push(
            (quote! {
                #[test]
                fn #methodname() {
                    common::golden(#filename);
                }
            }).into()
        );
    });
    TokenStream::from_iter(streams.into_iter())
}
