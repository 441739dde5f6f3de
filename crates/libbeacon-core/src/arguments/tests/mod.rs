mod argument_pipeline_tests;
mod argument_set_tests;
