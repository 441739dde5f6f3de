mod batch_loader_tests;
mod relation_batch_load_tests;
