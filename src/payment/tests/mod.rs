mod bridge_completion_tests;
