mod deconjugator_tests;
