//! JavaScript minification via oxc.

use std::path::PathBuf;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcMinifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{AssetKind, Minified, Minifier, MinifyError};
use crate::splice::{Mapping, parse_mapping};

/// Mangle + smallest compress + minified codegen.
///
/// The bundle is parsed as a classic script so top-level bindings, which
/// other bundles on the page may rely on, keep their names.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinifier;

impl Minifier for JsMinifier {
    fn minify(&self, code: &str, input_map: &Mapping, file: &str) -> Result<Minified, MinifyError> {
        let allocator = Allocator::default();
        let source_type = SourceType::mjs().with_module(false);
        let ret = Parser::new(&allocator, code, source_type).parse();
        if let Some(error) = ret.errors.first() {
            return Err(MinifyError::Parse {
                kind: AssetKind::Js,
                message: error.to_string(),
            });
        }
        let mut program = ret.program;

        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
        let output = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                source_map_path: Some(PathBuf::from(file)),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program);

        let map = match output.map {
            Some(map) => {
                let outer = parse_mapping(&map.to_json_string()).map_err(|err| MinifyError::Print {
                    kind: AssetKind::Js,
                    message: err.to_string(),
                })?;
                Some(outer.compose(input_map))
            }
            None => None,
        };

        Ok(Minified {
            code: output.code,
            map,
        })
    }
}
