mod sync_tests;
