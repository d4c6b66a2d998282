//! Print TypeScript declarations for the types shared with the web front end.
//!
//! Usage: `cargo run --bin generate_types > shared/types.ts`

use models::{
    AnalysisResult, CachedProductDetail, ErrorBody, Product, SearchResponse, SortOrder,
    SummaryRequest,
};
use ts_rs::TS;

fn main() {
    let decls = [
        Product::decl(),
        SummaryRequest::decl(),
        AnalysisResult::decl(),
        CachedProductDetail::decl(),
        SearchResponse::decl(),
        ErrorBody::decl(),
        SortOrder::decl(),
    ];

    println!("// This file was generated by `generate_types`. Do not edit it by hand.\n");
    for decl in decls {
        println!("export {decl}\n");
    }
}
