mod mutation_executor_tests;
