mod document_ast_tests;
mod merge_tests;
mod schema_printer_tests;
